// Dashboard handlers (d500+)
pub mod d500_ecommerce_overview;
