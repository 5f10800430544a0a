mod get_me;
mod login_user;
mod register_user;

use actix_web::web;
use get_me::get_me_controller;
use login_user::login_user_controller;
use register_user::register_user_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(register_user_controller));
    cfg.route("/auth/login", web::post().to(login_user_controller));
    cfg.route("/me", web::get().to(get_me_controller));
}
