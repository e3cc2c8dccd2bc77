pub mod twitch_chat;
