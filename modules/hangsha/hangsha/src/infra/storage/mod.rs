//! Storage infrastructure for hangsha.

pub mod category_repo;
pub mod enroll_repo;
pub mod entity;
pub mod event_repo;
pub mod mapper;
pub mod memo_repo;
pub mod migrations;
pub mod preference_repo;
pub mod user_repo;

#[cfg(test)]
mod mapper_test;
