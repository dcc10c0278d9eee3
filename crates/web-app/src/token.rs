/// Storage of the bearer token of the signed-in user.
pub trait TokenRepository {
    fn read_token(&self) -> Option<String>;
    fn write_token(&self, token: &str) -> Result<(), String>;
    fn delete_token(&self);
}
