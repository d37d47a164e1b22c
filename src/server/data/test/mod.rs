mod activity;
mod course;
mod document;
mod enrollment;
mod forum;
mod response;
mod user;
