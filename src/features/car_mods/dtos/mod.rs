pub mod car_mod_dto;

pub use car_mod_dto::{
    CarModResponseDto, MarkCompletedDto, ModStatusDto, ModStatusTreeDto, ModTreeQuery,
    UpdateCarModDto,
};
