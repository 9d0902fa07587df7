use crate::{
	constants::{AUTHORIZATION, EMPTY, IGNORE_ROUTES, MESSAGE_INVALID_TOKEN, ONE_WEEK},
	models::{ApiResponse, Role},
};
use actix_service::forward_ready;
use actix_web::{
	body::EitherBody,
	dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
	error::InternalError,
	http::Method,
	Error as AxError, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use actix_web_httpauth::headers::authorization::{Bearer, Scheme};
use chrono::Utc;
use futures::future::{ok, ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, errors::Error, DecodingKey, EncodingKey, Header, Validation};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
	pub iat: usize,
	pub exp: usize,
	pub sub: String,
	pub role: Role,
}

#[derive(Serialize, Deserialize)]
pub struct ResponseBody {
	message: String,
	data: String,
}

impl ResponseBody {
	fn new(m: &str, d: &str) -> Self {
		Self { message: String::from(m), data: String::from(d) }
	}
}

#[derive(Clone)]
pub struct JWT {
	secret: String,
}

impl JWT {
	pub fn new(s: &str) -> Self {
		Self { secret: s.to_string() }
	}

	pub fn create_jwt(&self, user_id: i32, role: Role) -> Result<String, Error> {
		let now = Utc::now().timestamp() as usize;
		let claims = Claims { iat: now, exp: now + ONE_WEEK, sub: user_id.to_string(), role };
		info!("Creating token for user {} with role {}", claims.sub, role.as_str());
		encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_ref()))
	}

	pub fn verify_jwt(&self, token: &str) -> Result<Claims, Error> {
		decode::<Claims>(
			token,
			&DecodingKey::from_secret(self.secret.as_ref()),
			&Validation::default(),
		)
		.map(|data| data.claims)
	}
}

/// Rejects requests without a valid bearer token, except for [`IGNORE_ROUTES`] and
/// CORS preflight. Verified [`Claims`] are stored in the request extensions.
pub struct Authentication {
	jwt: JWT,
}

impl Authentication {
	pub fn new(jwt: JWT) -> Self {
		Self { jwt }
	}
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError> + 'static,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type InitError = ();
	type Transform = AuthenticationMiddleware<S>;
	type Future = Ready<Result<Self::Transform, Self::InitError>>;

	fn new_transform(&self, service: S) -> Self::Future {
		ok(AuthenticationMiddleware { jwt: self.jwt.clone(), service: Rc::new(service) })
	}
}

pub struct AuthenticationMiddleware<S> {
	jwt: JWT,
	service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = AxError> + 'static,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<EitherBody<B>>;
	type Error = AxError;
	type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

	forward_ready!(service);

	fn call(&self, req: ServiceRequest) -> Self::Future {
		log::debug!("## Req: {}", req.path());

		let bypass = Method::OPTIONS == *req.method() ||
			IGNORE_ROUTES.iter().any(|route| req.path().starts_with(route));

		if !bypass {
			let claims = req
				.headers()
				.get(AUTHORIZATION)
				.and_then(|header| Bearer::parse(header).ok())
				.map(|bearer| self.jwt.verify_jwt(bearer.token()));

			match claims {
				Some(Ok(claims)) => {
					req.extensions_mut().insert(claims);
				},
				Some(Err(e)) => {
					error!("Invalid token: {:?}", e);
					return unauthorized(req);
				},
				None => {
					return unauthorized(req);
				},
			}
		}

		let service = Rc::clone(&self.service);
		Box::pin(async move { service.call(req).await.map(ServiceResponse::map_into_left_body) })
	}
}

fn unauthorized<B>(
	req: ServiceRequest,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, AxError>>
where
	B: 'static,
{
	let (request, _pl) = req.into_parts();
	let response = HttpResponse::Unauthorized()
		.json(ResponseBody::new(MESSAGE_INVALID_TOKEN, EMPTY))
		.map_into_right_body();

	Box::pin(async { Ok(ServiceResponse::new(request, response)) })
}

/// The caller resolved by [`Authentication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
	pub id: i32,
	pub role: Role,
}

impl AuthUser {
	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}

	pub fn require_admin(&self) -> Result<(), HttpResponse> {
		if self.is_admin() {
			Ok(())
		} else {
			log::warn!("User {} attempted an admin action", self.id);
			Err(HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required")))
		}
	}
}

impl FromRequest for AuthUser {
	type Error = AxError;
	type Future = Ready<Result<Self, Self::Error>>;

	fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
		let user = req.extensions().get::<Claims>().and_then(|claims| {
			claims.sub.parse::<i32>().ok().map(|id| AuthUser { id, role: claims.role })
		});

		ready(user.ok_or_else(|| {
			InternalError::from_response(
				"missing authentication",
				HttpResponse::Unauthorized().json(ApiResponse::<()>::error("Missing or invalid token")),
			)
			.into()
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_user_and_role() {
		let jwt = JWT::new("test_secret");
		let token = jwt.create_jwt(42, Role::Admin).unwrap();

		let claims = jwt.verify_jwt(&token).unwrap();

		assert_eq!(claims.sub, "42");
		assert_eq!(claims.role, Role::Admin);
		assert_eq!(claims.exp - claims.iat, ONE_WEEK);
	}

	#[test]
	fn rejects_tokens_signed_with_another_secret() {
		let token = JWT::new("one").create_jwt(1, Role::User).unwrap();

		assert!(JWT::new("two").verify_jwt(&token).is_err());
	}

	#[test]
	fn only_admins_pass_the_admin_check() {
		assert!(AuthUser { id: 1, role: Role::Admin }.require_admin().is_ok());
		assert!(AuthUser { id: 2, role: Role::User }.require_admin().is_err());
	}
}
