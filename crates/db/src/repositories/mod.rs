//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step mutations
//! (stock adjustment, allocation, order delivery, crew deletion) run in a
//! single transaction.

pub mod activity_repo;
pub mod cabinet_repo;
pub mod crew_repo;
pub mod equipment_repo;
pub mod facility_repo;
pub mod housing_unit_repo;
pub mod material_order_repo;
pub mod material_repo;
pub mod notification_repo;
pub mod photo_repo;
pub mod project_plan_repo;
pub mod project_repo;
pub mod readiness_repo;
pub mod segment_repo;
pub mod session_repo;
pub mod supplier_repo;
pub mod user_repo;
pub mod utility_contact_repo;
pub mod work_entry_repo;

pub use activity_repo::ActivityRepo;
pub use cabinet_repo::CabinetRepo;
pub use crew_repo::CrewRepo;
pub use equipment_repo::EquipmentRepo;
pub use facility_repo::FacilityRepo;
pub use housing_unit_repo::HousingUnitRepo;
pub use material_order_repo::MaterialOrderRepo;
pub use material_repo::{MaterialRepo, StockError};
pub use notification_repo::NotificationRepo;
pub use photo_repo::PhotoRepo;
pub use project_plan_repo::ProjectPlanRepo;
pub use project_repo::ProjectRepo;
pub use readiness_repo::ReadinessRepo;
pub use segment_repo::SegmentRepo;
pub use session_repo::SessionRepo;
pub use supplier_repo::SupplierRepo;
pub use user_repo::UserRepo;
pub use utility_contact_repo::UtilityContactRepo;
pub use work_entry_repo::WorkEntryRepo;
