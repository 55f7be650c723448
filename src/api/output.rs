use crate::api::dataset::{self, DatasetResource, ResourceFamily};
use crate::domain::model::DatasetKind;
use crate::domain::request::RequestDescriptor;

/// Calculation results. Same shapes as jsondata, without Excel import.
pub struct Output;

impl ResourceFamily for Output {
    const KIND: DatasetKind = DatasetKind::Output;
}

pub type OutputApi<'a> = DatasetResource<'a, Output>;

pub fn list_files() -> RequestDescriptor {
    dataset::list_files(DatasetKind::Output)
}

pub fn get_file(filename: &str) -> RequestDescriptor {
    dataset::get_file(DatasetKind::Output, filename)
}

pub fn update_file(
    filename: &str,
    data: serde_json::Map<String, serde_json::Value>,
) -> RequestDescriptor {
    dataset::update_file(DatasetKind::Output, filename, data)
}

pub fn add_entry(
    filename: &str,
    year: Option<&str>,
    country: Option<&str>,
    value: serde_json::Value,
) -> RequestDescriptor {
    dataset::add_entry(DatasetKind::Output, filename, year, country, value)
}

pub fn delete_entry(filename: &str, year: Option<&str>, country: Option<&str>) -> RequestDescriptor {
    dataset::delete_entry(DatasetKind::Output, filename, year, country)
}

pub fn export_excel(filename: &str) -> RequestDescriptor {
    dataset::export_excel(DatasetKind::Output, filename)
}
