pub mod demand;
pub mod positions;
pub mod prices;
pub mod routes;
pub mod speed;
pub mod types;

pub use demand::high_demand_times;
pub use positions::flight_positions;
pub use prices::price_trends;
pub use routes::popular_routes;
pub use speed::speed_distribution;
