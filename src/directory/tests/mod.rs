mod claims;
mod common;
mod routing;
