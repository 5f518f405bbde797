pub fn login_response_body(token: &str) -> String {
    return serde_json::json!({
        "access_token": token,
        "token_type": "bearer",
    })
    .to_string();
}

pub fn create_user_body(user_id: &str) -> String {
    return serde_json::json!({
        "Action": "User created",
        "user_id": user_id,
    })
    .to_string();
}

pub fn rag_list_body() -> String {
    return serde_json::json!([
        {"rag_id": "r-1", "rag_name": "papers", "model": "claude"},
        {"rag_id": "r-2", "rag_name": "contracts", "model": "openai"},
    ])
    .to_string();
}
