use crate::principal::errors::AuthError;
use crate::principal::models::DeviceId;
use crate::principal::models::Principal;

/// Resolve the device whose data a request may read.
///
/// A device principal with no explicit target implicitly resolves to
/// itself, and may never resolve to any other device, however well-formed
/// the requested id. Admin principals may target any device but must name
/// one explicitly. An empty string counts as absent.
pub fn resolve_device_scope(
    requested_device_id: Option<&str>,
    principal: &Principal,
) -> Result<DeviceId, AuthError> {
    let requested = match requested_device_id {
        None | Some("") => {
            return match principal {
                Principal::Device(device) => Ok(device.device_id),
                Principal::Admin(_) => Err(AuthError::MissingDeviceId),
            };
        }
        Some(raw) => DeviceId::from_string(raw)?,
    };

    if let Principal::Device(device) = principal {
        if device.device_id != requested {
            return Err(AuthError::DeviceScopeDenied);
        }
    }

    Ok(requested)
}
