//! Configuration for the hangsha module.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Limits and import settings for the hangsha service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServiceConfig {
    /// Maximum memo body length in characters.
    pub max_memo_length: usize,
    pub max_tag_name_length: usize,
    pub max_username_length: usize,
    /// Applies to course title, number, lecture number and instructor.
    pub max_course_field_length: usize,
    pub max_keyword_length: usize,

    /// Crawler output consumed by the event import.
    pub events_json_path: PathBuf,
    /// Prefix joined with a record's `dataSeq` to form its apply link.
    pub apply_link_base: String,
    /// Category group holding recruitment statuses.
    pub status_group_name: String,
    /// Category group holding program types.
    pub event_type_group_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_memo_length: 5000,
            max_tag_name_length: 50,
            max_username_length: 50,
            max_course_field_length: 100,
            max_keyword_length: 100,
            events_json_path: PathBuf::from("data/events.json"),
            apply_link_base: "https://extra.snu.ac.kr/ptfol/pgm/view.do?dataSeq=".to_owned(),
            status_group_name: "모집현황".to_owned(),
            event_type_group_name: "프로그램 유형".to_owned(),
        }
    }
}
