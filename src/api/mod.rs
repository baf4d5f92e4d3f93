//! Boundary types: extractors, request DTOs and response views.

pub mod extract;
pub mod format;
pub mod requests;

pub use extract::{JsonBody, PathParam};
pub use format::MovieView;
pub use requests::{
    category_name, CategoryParam, ImageUpload, LoginRequest, MovieFields, MovieForm, RegisterUserRequest,
    Registration, RenameCategoryRequest, UpdateUserRequest, UserUpdate,
};
