mod list_reminder_intervals;

use actix_web::web;
use list_reminder_intervals::list_reminder_intervals_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminder-intervals",
        web::get().to(list_reminder_intervals_controller),
    );
}
