mod chirp_dto;

pub use chirp_dto::{
    image_extension, is_image_type_allowed, ChirpFormDto, ChirpPayload, ChirpResponseDto,
    DeleteChirpResponseDto, NewImage, ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE,
};
