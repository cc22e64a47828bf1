mod controls;
mod details;
mod embeds;
mod panels;
