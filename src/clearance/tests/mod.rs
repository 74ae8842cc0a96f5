mod admins;
mod common;
