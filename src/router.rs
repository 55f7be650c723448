//! Static route table: two named screens and a root redirect.

use crate::domain::model::DatasetKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    JsonDataManagement,
    OutputResults,
}

impl View {
    pub fn dataset_kind(&self) -> DatasetKind {
        match self {
            View::JsonDataManagement => DatasetKind::JsonData,
            View::OutputResults => DatasetKind::Output,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub view: View,
}

pub const ROUTES: &[Route] = &[
    Route {
        path: "/jsondata",
        name: "JsonDataManagement",
        title: "数据管理",
        view: View::JsonDataManagement,
    },
    Route {
        path: "/output",
        name: "OutputResults",
        title: "计算结果",
        view: View::OutputResults,
    },
];

pub const REDIRECTS: &[(&str, &str)] = &[("/", "/jsondata")];

fn normalize(path: &str) -> &str {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// 解析路徑，必要時跟隨轉址
pub fn resolve(path: &str) -> Option<&'static Route> {
    let mut path = normalize(path);
    if let Some((_, target)) = REDIRECTS.iter().find(|(from, _)| *from == path) {
        path = target;
    }
    ROUTES.iter().find(|route| route.path == path)
}

pub fn by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name == name)
}
