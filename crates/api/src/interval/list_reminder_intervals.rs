use crate::error::DocwatchError;
use actix_web::{web, HttpResponse};
use docwatch_api_structs::dtos::ReminderIntervalDTO;
use docwatch_api_structs::list_reminder_intervals::*;
use docwatch_infra::DocwatchContext;

pub async fn list_reminder_intervals_controller(
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let intervals = ctx.repos.reminder_intervals.find_all().await;

    Ok(HttpResponse::Ok().json(APIResponse {
        reminder_intervals: intervals
            .into_iter()
            .map(ReminderIntervalDTO::new)
            .collect(),
    }))
}
