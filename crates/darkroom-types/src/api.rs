use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Photo;

// -- Session --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub identifier: String,
}

// -- Profile --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub photos: Vec<Photo>,
    pub followers: u64,
    pub following: u64,
}

// -- Photos --

#[derive(Debug, Serialize)]
pub struct UploadPhotoResponse {
    pub photo_id: Uuid,
    pub size: u64,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostCommentRequest {
    pub comment: String,
}
