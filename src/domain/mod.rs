//! Domain aggregates exposed by the CRM service layer.

pub mod activity;
pub mod client;
pub mod document;
pub mod email;
pub mod meeting;
pub mod stage;
pub mod team_member;
pub mod template;
pub mod types;
