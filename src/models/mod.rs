pub mod content;
pub mod course;
pub mod lesson_plan;
pub mod processing;
pub mod qaqf;
pub mod study_material;

pub use content::{
    BritishStandardsCheck, ContentRecord, ContentType, ContentUpdate, GenerateContentRequest,
    GenerateVideoRequest, GenerationResponse, VerificationResult, VerificationStatus,
    VerifyContentRequest,
};
pub use course::{
    derive_defaults, BasicInfo, CourseData, CourseType, DifficultyLevel, LearningObjective,
    LearningObjectives, SpecializedContent,
};
pub use lesson_plan::{LessonPlan, LessonPlanSection};
pub use processing::{GeneratedItem, ItemKind, ItemStatus};
pub use study_material::{Collection, StudyMaterial};
