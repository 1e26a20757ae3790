#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id_client: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
