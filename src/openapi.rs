//! OpenAPI document served at `/docs`.

use utoipa::OpenApi;

use crate::filtering::FilterOptions;
use crate::models::{
    Car, CarCreate, CarUpdate, Customer, CustomerCreate, CustomerType, CustomerUpdate,
    ServiceRecord, ServiceRecordCreate, ServiceRecordUpdate, UserInfo,
};
use crate::routes::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::routes::statistics::{
    CarServiceStat, CountStat, CustomerVisitsStat, RevenueStat, ServiceTypeStat, Statistics,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "autoshop-api",
        description = "REST API for car-service shop administration: customer, car, and \
                       service records plus dashboard statistics, behind a JWT login gate."
    ),
    components(schemas(
        Customer,
        CustomerCreate,
        CustomerUpdate,
        CustomerType,
        Car,
        CarCreate,
        CarUpdate,
        ServiceRecord,
        ServiceRecordCreate,
        ServiceRecordUpdate,
        UserInfo,
        LoginRequest,
        RegisterRequest,
        AuthResponse,
        Statistics,
        CountStat,
        RevenueStat,
        ServiceTypeStat,
        CustomerVisitsStat,
        CarServiceStat,
        FilterOptions,
    ))
)]
pub struct ApiDoc;
