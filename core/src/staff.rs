//! Staff lookup: `GET /{company}/staffs[/{staffId}]`.

use serde::{Deserialize, Serialize};

use crate::endpoint::{Credentials, EncodedRequest, Endpoint, Resource};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::query::Query;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(rename = "organizationId")]
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentCategory {
    #[serde(rename = "employmentCategoryId")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionGroup {
    #[serde(rename = "permissionGroupId")]
    pub id: i64,
    /// 1: company administrator, 2: administrator, 3: employee.
    #[serde(rename = "permissionType")]
    pub permission_type: i64,
    pub name: String,
}

/// One employee as returned by the staff endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Staff {
    #[serde(rename = "staffId")]
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub last_name_kana: String,
    pub first_name_kana: String,
    /// Main organization.
    pub organization: Organization,
    #[serde(rename = "subgroups")]
    pub sub_groups: Vec<Organization>,
    pub employment_category: EmploymentCategory,
    pub tag: String,
    pub staff_num: String,
    /// FeliCa IDm of the staff member's card.
    pub idm_num: String,
    pub card_type_id: i64,
    pub remarks: String,
    pub permission_group: PermissionGroup,
    pub managed_organizations: Vec<Organization>,
}

/// One page of staff records.
///
/// `count` is the number of records in `staffs`; `total_count` is how many
/// the token can see in total. Callers page through by raising
/// `GetStaffParams::page` until they have `total_count` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffList {
    pub login_company_code: String,
    #[serde(rename = "Count")]
    pub count: i64,
    #[serde(rename = "TotalCount")]
    pub total_count: i64,
    pub staffs: Vec<Staff>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetStaffParams {
    pub credentials: Credentials,
    /// Token of another staff member whose record should be fetched.
    pub target: Option<String>,
    pub staff_id: Option<i64>,
    /// Page number when listing every managed staff member.
    pub page: Option<u32>,
}

impl GetStaffParams {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }
}

impl Endpoint for GetStaffParams {
    type Output = StaffList;

    const RESOURCE: Resource = Resource::Staff;

    fn validate(&self) -> Result<(), ApiError> {
        self.credentials.validate()?;
        if self.target.is_some() && self.page.is_none() {
            return Err(ApiError::missing("Page"));
        }
        Ok(())
    }

    fn encode(&self) -> EncodedRequest {
        let mut path = format!("/{}/staffs", self.credentials.company_code);
        if let Some(staff_id) = self.staff_id {
            path.push_str(&format!("/{staff_id}"));
        }

        let mut query = Query::new();
        query.add("token", self.credentials.token.as_str());
        // `page` always travels with `target`; on its own it is optional.
        if let Some(target) = &self.target {
            query.add("target", target.as_str());
        }
        query.add_opt("page", self.page);

        EncodedRequest {
            method: HttpMethod::Get,
            path,
            query: query.encode(),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::decode;

    fn params() -> GetStaffParams {
        GetStaffParams::new(Credentials::new("foo", "bar"))
    }

    #[test]
    fn minimal_params_address_the_collection() {
        let encoded = params().encode();
        assert_eq!(encoded.method, HttpMethod::Get);
        assert_eq!(encoded.path_and_query(), "/foo/staffs?token=bar");
        assert!(encoded.body.is_none());
    }

    #[test]
    fn every_filter_is_encoded() {
        let params = GetStaffParams {
            target: Some("baz".to_string()),
            staff_id: Some(123),
            page: Some(2),
            ..params()
        };
        assert!(params.validate().is_ok());
        assert_eq!(
            params.encode().path_and_query(),
            "/foo/staffs/123?page=2&target=baz&token=bar"
        );
    }

    #[test]
    fn page_alone_is_encoded() {
        let params = GetStaffParams {
            page: Some(3),
            ..params()
        };
        assert_eq!(params.encode().path_and_query(), "/foo/staffs?page=3&token=bar");
    }

    #[test]
    fn staff_id_zero_is_still_a_filter() {
        let params = GetStaffParams {
            staff_id: Some(0),
            ..params()
        };
        assert_eq!(params.encode().path, "/foo/staffs/0");
    }

    #[test]
    fn validation_order() {
        let err = GetStaffParams::new(Credentials::new("", "foo")).validate().unwrap_err();
        assert_eq!(err.to_string(), "LoginCompanyCode must be set");

        let err = GetStaffParams::new(Credentials::new("foo", "")).validate().unwrap_err();
        assert_eq!(err.to_string(), "Token must be set");

        let err = GetStaffParams {
            target: Some("baz".to_string()),
            ..params()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Page must be set");
    }

    #[test]
    fn decodes_a_full_staff_record() {
        let body = r#"
            {
                "success":true,
                "response":{
                    "login_company_code":"foo",
                    "Count":1,
                    "TotalCount":1,
                    "staffs":[
                        {
                            "staffId":1,
                            "lastName":"愛",
                            "firstName":"上大",
                            "lastNameKana":"あい",
                            "firstNameKana":"うえお",
                            "organization":{},
                            "subgroups":[],
                            "employmentCategory":{},
                            "tag":"bar",
                            "staffNum":"123",
                            "idmNum":"456",
                            "cardTypeId":123,
                            "remarks":"baz",
                            "permissionGroup":{},
                            "managedOrganizations":[]
                        }
                    ]
                },
                "errors":[]
            }"#;
        let list: StaffList = decode(body.as_bytes(), Resource::Staff).unwrap();
        assert_eq!(
            list,
            StaffList {
                login_company_code: "foo".to_string(),
                count: 1,
                total_count: 1,
                staffs: vec![Staff {
                    id: 1,
                    last_name: "愛".to_string(),
                    first_name: "上大".to_string(),
                    last_name_kana: "あい".to_string(),
                    first_name_kana: "うえお".to_string(),
                    organization: Organization::default(),
                    sub_groups: Vec::new(),
                    employment_category: EmploymentCategory::default(),
                    tag: "bar".to_string(),
                    staff_num: "123".to_string(),
                    idm_num: "456".to_string(),
                    card_type_id: 123,
                    remarks: "baz".to_string(),
                    permission_group: PermissionGroup::default(),
                    managed_organizations: Vec::new(),
                }],
            }
        );
    }

    #[test]
    fn decodes_embedded_value_objects() {
        let body = r#"{"success":true,"response":{"staffs":[{
            "organization":{"organizationId":7,"name":"Sales"},
            "subgroups":[{"organizationId":8,"name":"East"}],
            "employmentCategory":{"employmentCategoryId":2,"Name":"Part-time"},
            "permissionGroup":{"permissionGroupId":4,"permissionType":3,"name":"Staff"}
        }]}}"#;
        let list: StaffList = decode(body.as_bytes(), Resource::Staff).unwrap();
        let staff = &list.staffs[0];
        assert_eq!(staff.organization, Organization { id: 7, name: "Sales".to_string() });
        assert_eq!(staff.sub_groups.len(), 1);
        assert_eq!(staff.employment_category.name, "Part-time");
        assert_eq!(staff.permission_group.permission_type, 3);
    }

    #[test]
    fn failed_envelope_is_a_staff_failure() {
        let err = decode::<StaffList>(br#"{"success":false}"#, Resource::Staff).unwrap_err();
        assert_eq!(err.to_string(), "Requesting Staff API failed");
    }
}
