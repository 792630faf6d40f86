use crate::http::request::Request;
use crate::http::response::Response;

/// Something that can answer a routed request.
///
/// Handlers run on the server thread inside the connection task that read
/// the request, so they must not block. Whatever they leave on the
/// [`Response`] is sent back.
pub trait Handler {
    fn handle(&self, req: &Request, res: &mut Response);
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response),
{
    fn handle(&self, req: &Request, res: &mut Response) {
        self(req, res)
    }
}
