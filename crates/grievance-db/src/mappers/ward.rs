//! Ward entity <-> model mapper

use grievance_core::entities::Ward;

use crate::models::WardModel;

/// Convert WardModel to Ward entity
impl From<WardModel> for Ward {
    fn from(model: WardModel) -> Self {
        Ward {
            id: model.id,
            name: model.name,
            area_name: model.area_name,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
