//! Route handlers grouped by audience.
//!
//! Access control is enforced by the security middleware; handlers only see
//! requests the rule table already admitted.

pub mod account;
pub mod admin;
pub mod fuzzy;
pub mod items;

use actix_web::web;

use crate::error::ApiError;
use crate::model::ItemKind;

/// Registers every application route. Login and logout are registered by
/// the form login service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(account::register)
    .service(account::user_details)
    .service(admin::list_students)
    .service(admin::delete_student);

    item_routes(cfg, "lost-items", ItemKind::Lost);
    item_routes(cfg, "found-items", ItemKind::Found);
}

/// Item endpoints for one kind. `/user` is registered before `/{id}`.
fn item_routes(cfg: &mut web::ServiceConfig, segment: &str, kind: ItemKind) {
    let base = format!("/lost-found/{}", segment);

    let mut by_id = web::resource(format!("{}/{{id}}", base))
        .app_data(web::Data::new(kind))
        .route(web::get().to(items::get_item));
    if kind == ItemKind::Lost {
        by_id = by_id.route(web::delete().to(items::delete_item));
    }

    cfg.service(
        web::resource(base.as_str())
            .app_data(web::Data::new(kind))
            .route(web::get().to(items::list_items))
            .route(web::post().to(items::create_item)),
    )
    .service(
        web::resource(format!("{}/user", base))
            .app_data(web::Data::new(kind))
            .route(web::get().to(items::my_items)),
    )
    .service(by_id)
    .service(
        web::resource(format!("/lost-found/fuzzy/{}", segment))
            .app_data(web::Data::new(kind))
            .route(web::get().to(fuzzy::search)),
    );
}
