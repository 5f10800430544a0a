pub mod create_document;
mod delete_document;
mod get_document;
mod get_document_reminders;
mod list_documents;
pub mod send_document_reminder;
mod subscribers;
pub mod sync_document_reminders;
pub mod toggle_document_reminder;
mod update_document;

use actix_web::web;
use create_document::create_document_controller;
use delete_document::delete_document_controller;
use get_document::get_document_controller;
use get_document_reminders::get_document_reminders_controller;
use list_documents::list_documents_controller;
use toggle_document_reminder::toggle_document_reminder_controller;
use update_document::update_document_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/documents", web::post().to(create_document_controller));
    cfg.route("/documents", web::get().to(list_documents_controller));

    cfg.route(
        "/documents/{document_id}",
        web::get().to(get_document_controller),
    );
    cfg.route(
        "/documents/{document_id}",
        web::put().to(update_document_controller),
    );
    cfg.route(
        "/documents/{document_id}",
        web::delete().to(delete_document_controller),
    );

    cfg.route(
        "/documents/{document_id}/reminders",
        web::get().to(get_document_reminders_controller),
    );
    cfg.route(
        "/documents/{document_id}/reminders",
        web::put().to(toggle_document_reminder_controller),
    );
}
