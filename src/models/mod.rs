pub mod candidate;
pub mod cost;
pub mod event;
pub mod kit;
pub mod notification;
pub mod pipeline;
pub mod snapshot;
pub mod task;
pub mod template;
pub mod user;
