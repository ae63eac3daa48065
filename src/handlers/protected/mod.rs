// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication + per-route role allow-list
// Route Prefix: /api/*
// Middleware: production source check -> role gate

pub mod chart;
