mod submission_dto;

pub use submission_dto::{QrDataDto, SaveLocationDto, SaveLocationResponseDto};
