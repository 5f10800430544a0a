mod route_guards;
mod token;

pub use route_guards::protect_route;
pub use token::create_token;
