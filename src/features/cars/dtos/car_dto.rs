use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::cars::models::Car;
use crate::shared::constants::{MAX_CAR_FIELD_LENGTH, MAX_CAR_YEAR, MIN_CAR_YEAR};
use crate::shared::patch::Patch;
use crate::shared::validation::{validate_not_blank, validate_url_patch};

/// Response DTO for a car
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CarResponseDto {
    pub id: String,
    pub user_id: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub year: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Car> for CarResponseDto {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            user_id: car.user_id,
            make: car.make,
            model: car.model,
            color: car.color,
            year: car.year,
            image_url: car.image_url,
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

/// Query params for listing cars
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CarQueryParams {
    /// Owner whose garage to list
    pub user_id: String,
}

/// Request DTO for adding a car to a garage
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCarDto {
    #[validate(length(min = 1), custom(function = "validate_not_blank"))]
    pub user_id: String,

    #[validate(
        length(min = 1, max = MAX_CAR_FIELD_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub make: String,

    #[validate(
        length(min = 1, max = MAX_CAR_FIELD_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub model: String,

    #[validate(
        length(min = 1, max = MAX_CAR_FIELD_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub color: String,

    #[validate(range(min = MIN_CAR_YEAR, max = MAX_CAR_YEAR))]
    pub year: i32,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Request DTO for updating a car. `image_url: null` removes the photo.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCarDto {
    #[validate(
        length(min = 1, max = MAX_CAR_FIELD_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub make: Option<String>,

    #[validate(
        length(min = 1, max = MAX_CAR_FIELD_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub model: Option<String>,

    #[validate(
        length(min = 1, max = MAX_CAR_FIELD_LENGTH),
        custom(function = "validate_not_blank")
    )]
    pub color: Option<String>,

    #[validate(range(min = MIN_CAR_YEAR, max = MAX_CAR_YEAR))]
    pub year: Option<i32>,

    #[serde(default)]
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_url_patch"))]
    pub image_url: Patch<String>,
}

impl UpdateCarDto {
    pub fn apply_to(self, mut current: Car, now: DateTime<Utc>) -> Car {
        if let Some(make) = self.make {
            current.make = make.trim().to_string();
        }
        if let Some(model) = self.model {
            current.model = model.trim().to_string();
        }
        if let Some(color) = self.color {
            current.color = color.trim().to_string();
        }
        if let Some(year) = self.year {
            current.year = year;
        }
        current.image_url = self.image_url.apply(current.image_url);
        current.updated_at = Some(now);
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored_car() -> Car {
        Car {
            id: "car-1".to_string(),
            user_id: "user-1".to_string(),
            make: "Subaru".to_string(),
            model: "WRX".to_string(),
            color: "Blue".to_string(),
            year: 2019,
            image_url: Some("https://img.example.com/wrx.jpg".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_create_rejects_out_of_range_year() {
        let dto: CreateCarDto = serde_json::from_value(serde_json::json!({
            "user_id": "user-1",
            "make": "Ford",
            "model": "Model T",
            "color": "Black",
            "year": 1800
        }))
        .unwrap();

        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("year"));
    }

    #[test]
    fn test_create_rejects_blank_make() {
        let dto: CreateCarDto = serde_json::from_value(serde_json::json!({
            "user_id": "user-1",
            "make": "   ",
            "model": "Civic",
            "color": "Red",
            "year": 2001
        }))
        .unwrap();

        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_rejects_invalid_image_url() {
        let dto: UpdateCarDto =
            serde_json::from_value(serde_json::json!({ "image_url": "wrx.jpg" })).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("image_url"));
    }

    #[test]
    fn test_update_clears_image_and_keeps_rest() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let dto: UpdateCarDto =
            serde_json::from_value(serde_json::json!({ "color": "Red", "image_url": null }))
                .unwrap();

        let updated = dto.apply_to(stored_car(), now);

        assert_eq!(updated.color, "Red");
        assert_eq!(updated.make, "Subaru");
        assert_eq!(updated.year, 2019);
        assert!(updated.image_url.is_none());
        assert_eq!(updated.updated_at, Some(now));
    }
}
