pub mod ai_service;
pub mod candidate_service;
pub mod event_service;
pub mod export_service;
pub mod import_service;
pub mod intake_service;
pub mod kit_service;
pub mod lifecycle_service;
pub mod notification_service;
pub mod pipeline_service;
pub mod report_service;
pub mod store_service;
pub mod task_service;
pub mod template_service;

#[cfg(test)]
pub(crate) mod fixtures;
