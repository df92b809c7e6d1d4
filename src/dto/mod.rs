pub mod auth_dto;
pub mod candidate_dto;
pub mod maintenance_dto;
pub mod workflow_dto;
