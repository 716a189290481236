pub mod checksum;
pub mod form;
pub mod mrz;
pub mod mrz_window;

pub use checksum::check_digit;
pub use form::FieldValidator;
pub use mrz::MrzDecoder;
pub use mrz_window::MrzWindow;
