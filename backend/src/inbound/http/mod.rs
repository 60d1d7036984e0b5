//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod envelope;
pub mod error;
mod ids;
pub mod medical_records;
pub mod schemas;
pub mod sign_in;
pub mod state;

use std::sync::Arc;

use actix_web::web;

pub use error::ApiResult;

use auth::BearerAuth;
use state::HttpState;

/// Register the authenticated API, its state and its extractor policies.
///
/// Body decoding failures map onto `WrongContentType` or
/// `InvalidMedicalRecordRequest`, and query decoding failures onto
/// `InvalidParam`, so every rejection uses the error envelope. Register
/// unauthenticated services (such as API docs) before calling this: the
/// authenticated scope matches every path.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
/// use record_service::inbound::http::{configure, state::HttpState};
///
/// fn app(state: HttpState) {
///     let _app = App::new().configure(configure(state));
/// }
/// ```
pub fn configure(state: HttpState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let auth = BearerAuth::new(Arc::clone(&state.identity));
        cfg.app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(error::json_error))
            .app_data(web::QueryConfig::default().error_handler(error::query_error))
            .service(
                web::scope("")
                    .wrap(auth)
                    .service(sign_in::sign_in)
                    .service(medical_records::create_medical_record)
                    .service(medical_records::list_medical_records)
                    .service(medical_records::get_medical_record)
                    .service(medical_records::update_medical_record),
            );
    }
}
