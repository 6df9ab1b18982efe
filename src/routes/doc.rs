use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        addresses::{AddressDto, AddressList, AddressPayload},
        auth::{LoginRequest, LoginResponse, LogoutRequest, RegisterRequest, RegisterResponse},
        cart::{AddToCartRequest, CartLine, CartList},
        catalog::{
            CategoryDto, CategoryList, CreateCategoryRequest, CreateSubCategoryRequest,
            SubCategoryDto, SubCategoryList, UpdateCategoryRequest, UpdateSubCategoryRequest,
        },
        orders::{
            Invoice, InvoiceAmounts, InvoiceCustomer, InvoiceLine, InvoicePayment, OrderAddress,
            OrderDto, OrderItemDto, OrderLineRequest, OrderList, OrderWithItems,
            PlaceOrderRequest, UpdateOrderStatusRequest,
        },
        payments::{
            CheckoutPayload, CheckoutPrefill, CheckoutRequest, CreateGatewayOrderRequest,
            CreateGatewayOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse,
        },
        products::{
            CreateProductRequest, ProductDto, ProductList, ProductWithStock, StockDto,
            StockUpdateRequest, UpdateProductRequest,
        },
        reviews::{AdminReviewRequest, ReviewDto, ReviewList, SubmitReviewRequest},
        users::{UpdateProfileRequest, UserList, UserProfile},
        wishlist::{AddToWishlistRequest, WishlistLine, WishlistList},
    },
    response::{ApiResponse, Meta},
    routes::{
        addresses, auth, cart, categories, health, orders, params, payments,
        products as product_routes, reviews, users, wishlist as wishlist_routes,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        users::me,
        users::update_profile,
        users::list_users,
        users::get_user,
        users::delete_user,
        addresses::add_address,
        addresses::list_addresses,
        addresses::update_address,
        addresses::delete_address,
        categories::create_category,
        categories::list_categories,
        categories::update_category,
        categories::delete_category,
        categories::create_subcategory,
        categories::list_subcategories,
        categories::update_subcategory,
        categories::delete_subcategory,
        product_routes::create_product,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::update_product,
        product_routes::delete_product,
        product_routes::update_stock,
        product_routes::list_reviews,
        cart::add_to_cart,
        cart::cart_list,
        cart::remove_from_cart,
        wishlist_routes::add_to_wishlist,
        wishlist_routes::wishlist,
        wishlist_routes::remove_from_wishlist,
        orders::place_order,
        orders::my_orders,
        orders::list_all_orders,
        orders::get_order,
        orders::update_order_status,
        orders::invoice,
        payments::create_gateway_order,
        payments::checkout,
        payments::verify_payment,
        payments::webhook,
        reviews::submit_review,
        reviews::admin_review,
        reviews::my_review,
        reviews::delete_review
    ),
    components(
        schemas(
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            LogoutRequest,
            UserProfile,
            UpdateProfileRequest,
            UserList,
            AddressPayload,
            AddressDto,
            AddressList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryDto,
            CategoryList,
            CreateSubCategoryRequest,
            UpdateSubCategoryRequest,
            SubCategoryDto,
            SubCategoryList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductDto,
            ProductList,
            StockUpdateRequest,
            StockDto,
            ProductWithStock,
            AddToCartRequest,
            CartLine,
            CartList,
            AddToWishlistRequest,
            WishlistLine,
            WishlistList,
            OrderAddress,
            OrderLineRequest,
            PlaceOrderRequest,
            OrderDto,
            OrderItemDto,
            OrderWithItems,
            OrderList,
            UpdateOrderStatusRequest,
            Invoice,
            InvoiceCustomer,
            InvoiceLine,
            InvoiceAmounts,
            InvoicePayment,
            CreateGatewayOrderRequest,
            CreateGatewayOrderResponse,
            CheckoutRequest,
            CheckoutPrefill,
            CheckoutPayload,
            VerifyPaymentRequest,
            VerifyPaymentResponse,
            SubmitReviewRequest,
            AdminReviewRequest,
            ReviewDto,
            ReviewList,
            params::Pagination,
            params::UserListQuery,
            params::ProductListQuery,
            Meta,
            ApiResponse<UserProfile>,
            ApiResponse<ProductList>,
            ApiResponse<ProductWithStock>,
            ApiResponse<CartList>,
            ApiResponse<WishlistList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<Invoice>,
            ApiResponse<CheckoutPayload>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and session endpoints"),
        (name = "Users", description = "User profile and directory endpoints"),
        (name = "Addresses", description = "Address book endpoints"),
        (name = "Catalog", description = "Category and subcategory endpoints"),
        (name = "Products", description = "Product and stock endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Payment gateway endpoints"),
        (name = "Reviews", description = "Review endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
