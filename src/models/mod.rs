pub mod car;
pub mod customer;
pub mod service_record;
pub mod user;

pub use car::{Car, CarCreate, CarUpdate};
pub use customer::{Customer, CustomerCreate, CustomerType, CustomerUpdate};
pub use service_record::{ServiceRecord, ServiceRecordCreate, ServiceRecordUpdate};
pub use user::UserInfo;
