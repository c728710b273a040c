//! HTTP request handlers

pub mod error;
pub mod health;
pub mod users;
pub mod users_form;

use actix_web::web;

/// Register every route; `template` goes before `{user_id}`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(users::template)
        .service(users::retrieve_all)
        .service(users::retrieve_one)
        .service(users::create)
        .service(users::create_with_image)
        .service(users::update)
        .service(users::delete_user);
}
