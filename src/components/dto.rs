use serde::{Deserialize, Serialize};

use crate::components::repo_types::ComponentPhotoProps;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPhotoRequest {
    pub component_name: String,
    pub photo_id: i64,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub props: ComponentPhotoProps,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub order: Option<i32>,
    pub props: Option<ComponentPhotoProps>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}
