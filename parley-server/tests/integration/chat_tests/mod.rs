mod test_chat_broadcast;
mod test_undecodable_messages_named;
