mod children;
mod model;
mod persist;
