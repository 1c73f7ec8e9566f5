pub mod check_page;

pub use check_page::CheckPageUseCase;
