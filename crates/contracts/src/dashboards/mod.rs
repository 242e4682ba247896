pub mod d500_ecommerce_overview;
