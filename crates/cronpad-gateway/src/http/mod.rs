pub mod crontab;
pub mod health;
