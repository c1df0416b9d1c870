mod test_disconnect_notifies_and_prunes;
mod test_join_snapshot_and_notifications;
mod test_leave_ack_and_room_cleanup;
mod test_rejoin_moves_peer;
