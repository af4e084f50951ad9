//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod contractor;
pub mod funding;
pub mod gps;
pub mod lookup;
pub mod milestone;
pub mod progress;
pub mod project;
pub mod quality;
pub mod report;
pub mod section;
pub mod session;
pub mod user;

pub use contractor::{
    ContractorError, ContractorFilter, ContractorRepository, CreateAssignmentInput,
    CreateContractorInput, UpdateAssignmentInput, UpdateContractorInput,
};
pub use funding::{
    CreateFundingInput, CreateTransactionInput, FundingError, FundingFilter, FundingRepository,
    UpdateFundingInput,
};
pub use gps::{CreateGpsPointInput, GpsError, GpsFilter, GpsRepository};
pub use lookup::{LookupData, LookupError, LookupRepository, ProvinceOption};
pub use milestone::{
    CreateMilestoneInput, CreateMilestoneUpdateInput, MilestoneError, MilestoneRepository,
    UpdateMilestoneInput,
};
pub use progress::{
    CreateProgressReportInput, ProgressError, ProgressFilter, ProgressRepository,
    UpdateProgressReportInput,
};
pub use project::{
    CreateProjectInput, ProjectError, ProjectFilter, ProjectRepository, UpdateProjectInput,
};
pub use quality::{
    CreateQualityReportInput, QualityError, QualityFilter, QualityRepository,
    UpdateQualityReportInput,
};
pub use report::{ReportError, ReportRepository};
pub use section::{CreateSectionInput, SectionError, SectionRepository, UpdateSectionInput};
pub use session::SessionRepository;
pub use user::{CreateUserInput, UserRepository};
