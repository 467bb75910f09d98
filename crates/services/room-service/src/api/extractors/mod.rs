mod checked_json;

pub use checked_json::CheckedJson;
