mod test_responder_flow;
