pub mod mod_dto;

pub use mod_dto::{CreateModDto, ModQueryParams, ModResponseDto, ModTreeDto, UpdateModDto};
