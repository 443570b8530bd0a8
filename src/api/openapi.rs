//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{access, borrows, fines, health, items, payments};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ReadOps API",
        version = "1.0.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "ReadOps Team", email = "contact@readops.org")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        items::list_items,
        items::get_item,
        // Digital access
        access::request_access,
        access::get_user_access,
        access::read_book,
        access::download_book,
        // Payments
        payments::get_payment,
        payments::payment_status,
        payments::confirm_payment,
        // Borrows
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::extend_borrow,
        borrows::get_user_borrows,
        borrows::list_overdue,
        borrows::remind_overdue,
        // Fines
        fines::get_user_fines,
        fines::pay_fine,
    ),
    components(
        schemas(
            // Catalog
            crate::models::item::DigitalItem,
            crate::models::item::BookKind,
            // Digital access
            crate::models::access::AccessRecord,
            crate::models::access::AccessType,
            crate::models::access::AccessStatus,
            access::AccessRequest,
            access::AccessResponse,
            access::AuthorizeRequest,
            access::AuthorizeResponse,
            // Payments
            crate::models::payment::PaymentRequest,
            crate::models::payment::PaymentStatus,
            crate::services::payments::PaymentStatusReport,
            payments::ConfirmPaymentRequest,
            payments::ConfirmPaymentResponse,
            // Borrows
            crate::models::borrow::Borrow,
            borrows::CreateBorrowRequest,
            borrows::ReturnResponse,
            borrows::RemindersResponse,
            // Fines
            crate::models::fine::Fine,
            crate::models::fine::FineStatus,
            fines::PayFineRequest,
            // Users
            crate::models::user::User,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Digital book catalog"),
        (name = "access", description = "Digital access lifecycle"),
        (name = "payments", description = "QR payment requests"),
        (name = "borrows", description = "Physical borrowing"),
        (name = "fines", description = "Late-return fines")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
