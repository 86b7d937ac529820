pub mod application {
    pub mod health {
        pub mod check_readiness;
    }
}

pub mod domain {
    pub mod logger;
    pub mod health {
        pub mod errors;
        pub mod model;
        pub mod probe;
        pub mod use_cases {
            pub mod check_readiness;
        }
    }
}
