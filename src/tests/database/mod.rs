mod analytics;
mod migrations;
mod sessions;
mod users;
