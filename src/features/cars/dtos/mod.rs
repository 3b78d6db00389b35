pub mod car_dto;

pub use car_dto::{CarQueryParams, CarResponseDto, CreateCarDto, UpdateCarDto};
