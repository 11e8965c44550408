pub mod image_intake;
