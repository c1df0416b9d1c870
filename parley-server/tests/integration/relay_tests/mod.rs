mod test_offer_relayed_with_sender_id;
mod test_pre_join_rejected;
mod test_relay_to_departed_is_dropped;
mod test_rooms_are_isolated;
