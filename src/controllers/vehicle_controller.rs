use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::response::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters, VehicleResponse,
};
use crate::middleware::auth::{AuthenticatedUser, Capability};
use crate::models::vehicle::VehicleSpecs;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct VehicleController {
    repository: VehicleRepository,
}

/// Catálogo con tipos disponibles para las opciones de filtro
#[derive(Debug, serde::Serialize)]
pub struct VehicleCatalog {
    pub vehicles: Vec<VehicleResponse>,
    pub types: Vec<String>,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        user.require(Capability::Admin)?;
        request.validate()?;

        if request.price_per_day <= rust_decimal::Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Price per day must be a positive number".to_string(),
            ));
        }

        let specs = VehicleSpecs {
            make: request.make.clone(),
            model: request.model.clone(),
            year: request.year,
            seats: request.seats,
            transmission: request.transmission,
            fuel_type: request.fuel_type,
        };

        let name = format!("{} {}", request.make, request.model);
        let description = request.description.unwrap_or_else(|| {
            format!(
                "{} {} {} - {} {}",
                request.make, request.model, request.year, specs.transmission, specs.fuel_type
            )
        });

        let vehicle = self
            .repository
            .create(
                name,
                request.vehicle_type,
                request.price_per_day,
                specs,
                Some(description),
                request.features,
                request.images,
                request.availability,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn browse(&self, filters: VehicleFilters) -> Result<VehicleCatalog, AppError> {
        let vehicles = self.repository.find_filtered(&filters).await?;
        let types = self.repository.distinct_types().await?;

        Ok(VehicleCatalog {
            vehicles: vehicles.into_iter().map(Into::into).collect(),
            types,
        })
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        user.require(Capability::Admin)?;
        request.validate()?;

        // Cargar el vehículo actual y aplicar solo los campos presentes.
        // Los cambios de precio no reescriben reservas existentes.
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let price_per_day = request.price_per_day.unwrap_or(current.price_per_day);
        if price_per_day <= rust_decimal::Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Price per day must be a positive number".to_string(),
            ));
        }

        let specs = VehicleSpecs {
            make: request.make.unwrap_or(current.specs.0.make),
            model: request.model.unwrap_or(current.specs.0.model),
            year: request.year.unwrap_or(current.specs.0.year),
            seats: request.seats.unwrap_or(current.specs.0.seats),
            transmission: request.transmission.unwrap_or(current.specs.0.transmission),
            fuel_type: request.fuel_type.unwrap_or(current.specs.0.fuel_type),
        };

        let vehicle = self
            .repository
            .update(
                id,
                format!("{} {}", specs.make, specs.model),
                request.vehicle_type.unwrap_or(current.vehicle_type),
                price_per_day,
                specs,
                request.description.or(current.description),
                request.features.unwrap_or(current.features),
                request.images.unwrap_or(current.images),
                request.availability.unwrap_or(current.availability),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle.into(),
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        user.require(Capability::Admin)?;
        self.repository.delete(id).await
    }
}
