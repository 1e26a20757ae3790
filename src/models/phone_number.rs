#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    pub id_phone: i32,
    pub id_client: i32,
    pub phone_number: Option<String>,
}
